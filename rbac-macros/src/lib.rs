//! rbac-domain 的过程宏
//!
//! - `#[entity]`：为实体结构体注入 `EntityBase` 并实现 `Entity`
//! - `#[entity_id]`：为单字段 tuple struct 标识类型补齐派生与转换
//! - `#[value_object]`：为值对象补齐派生
//!
use proc_macro::TokenStream;

mod derive_utils;
mod entity;
mod entity_id;
mod field_utils;
mod value_object;

/// 实体宏
/// - 在字段最前注入 `base: ::rbac_domain::entity::EntityBase`（`#[serde(flatten)]`）
/// - 自动实现 `::rbac_domain::entity::Entity`（`KIND/new/base/base_mut`）
/// - 支持参数：`#[entity(kind = "role_group", debug = false)]`
///   - `kind` 默认取结构体名的 snake_case 形式
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}

/// 实体 ID 宏
/// 用于 `struct Id(u64);` 这类单字段 tuple struct，
/// 补齐派生并实现 `new/Display/FromStr/AsRef/From` 等。
#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity_id::expand(attr, item)
}

/// 值对象宏
/// 合并/追加派生：Default, Clone, Debug（可关闭）, Serialize, Deserialize, PartialEq, Eq
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}
