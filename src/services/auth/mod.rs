pub mod factory;
pub mod guard;
pub mod guard_list;
pub mod provider;
pub mod resolver;
pub mod session_guard;
#[cfg(test)]
pub mod testing;
pub mod token_guard;
pub mod user_provider;

pub use factory::build_auth_manager;
pub use guard::{AuthUser, CredentialMap, Credentials, Guard, GuardError, GuardResult};
pub use guard_list::{GuardList, GuardName, GuardSpec};
pub use provider::{AuthManager, GuardDriver, GuardProvider, RequestGuards};
pub use resolver::{GuardCall, GuardResolver, GuardValue, ResolvedGuard, auth_guards};
pub use user_provider::UserProvider;
