//! Handlers 模块
//!
//! 每个资源一个文件：先认证（require_caller），再做角色/归属检查，最后调用模型层。
//! 例外是 ingest：远端网络回调入口，不做认证。

pub mod applications;
pub mod companies;
pub mod device_profiles;
pub mod devices;
pub mod ingest;
pub mod links;
pub mod metrics;
pub mod networks;
pub mod password_policies;
pub mod protocol_data;
pub mod protocols;
pub mod provisioning_fields;
pub mod reference;
pub mod sessions;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;

pub use applications::*;
pub use companies::*;
pub use device_profiles::*;
pub use devices::*;
pub use ingest::*;
pub use links::*;
pub use metrics::*;
pub use networks::*;
pub use password_policies::*;
pub use protocol_data::*;
pub use protocols::*;
pub use provisioning_fields::*;
pub use reference::*;
pub use sessions::*;
pub use users::*;
