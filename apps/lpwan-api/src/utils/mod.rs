//! 响应封装、查询参数转换与输入校验

pub mod query;
pub mod response;
pub mod validation;

pub use query::*;
pub use response::*;
pub use validation::*;
