//! 类型定义模块

mod ids;
mod parameter;
mod schema;
mod trans_data;

pub use ids::QualifierIds;
pub use parameter::{ParamKind, ParamParent, Parameter};
pub use schema::{
    ColorRange, Command, Depends, Detail, DetailKind, Direction, ListValue, NumericRange,
    Qualifier, QualifierType, TransformSchema,
};
pub use trans_data::{TransData, TransformBody};
