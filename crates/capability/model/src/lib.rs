//! # 模型层
//!
//! 位于 REST 处理器与实体 DAO 之间，负责跨实体编排：
//! - **级联删除**：公司 → 应用/用户/设备档案/公司策略/公司关联；应用 → 设备/应用关联；设备 → 设备关联
//! - **securityData 保护**：按网络独立密钥加密存储（见 [`security`]）
//! - **远端同步**：按网络拉取组织、应用、设备档案、设备并对账（见 [`NetworkSync`]）
//! - **协议元数据**：网络协议读取时合并处理器 metaData
//! - **口令策略**：全局 + 公司规则校验
//! - **数据转发**：应用启停，网络上行数据经上报协议投递到应用（见 [`ApplicationRelay`]）
//!
//! [`ModelApi`] 由注入的存储后端和协议注册表构建全部模型。

mod api;
mod application;
mod company;
mod device;
mod device_profile;
mod error;
mod links;
mod network;
mod network_protocol;
mod password_policy;
mod protocol_data;
mod pull;
mod reference;
mod relay;
pub mod security;
mod user;

pub use api::ModelApi;
pub use application::ApplicationModel;
pub use company::CompanyModel;
pub use device::DeviceModel;
pub use device_profile::DeviceProfileModel;
pub use error::{CascadeFailure, CascadeReport, ModelError};
pub use links::{
    ApplicationNetworkTypeLinkModel, CompanyNetworkTypeLinkModel, DeviceNetworkTypeLinkModel,
};
pub use network::NetworkModel;
pub use network_protocol::NetworkProtocolModel;
pub use password_policy::PasswordPolicyModel;
pub use protocol_data::ProtocolDataModel;
pub use pull::{NetworkSync, PullCount, PullReport, SyncTargets};
pub use reference::{
    NetworkProviderModel, NetworkProvisioningFieldModel, NetworkTypeModel, ReportingProtocolModel,
};
pub use relay::{ApplicationRelay, IngestOutcome};
pub use security::{ProtocolDataAccess, SecurityError};
pub use user::{UserChanges, UserInput, UserModel};
