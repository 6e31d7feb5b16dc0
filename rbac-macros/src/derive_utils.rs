use quote::ToTokens;
use std::collections::HashSet;
use syn::{Attribute, Path, Token, punctuated::Punctuated};

/// 拆分属性：返回（非 derive 属性, 已声明的 derive 路径）
fn split_derives(attrs: &[Attribute]) -> (Vec<Attribute>, Vec<Path>) {
    let mut retained = Vec::new();
    let mut existing = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("derive") {
            retained.push(attr.clone());
            continue;
        }
        if let Ok(list) = attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated) {
            existing.extend(list);
        }
    }
    (retained, existing)
}

/// 归一化 derive 名，`Serialize` 与 `serde::Serialize` 视为同一项，
/// `std::fmt::Debug` 与 `Debug` 同理
fn derive_key(p: &Path) -> String {
    match p.segments.last() {
        Some(last) => match last.ident.to_string().as_str() {
            name @ ("Serialize" | "Deserialize") => format!("serde::{name}"),
            name => name.to_string(),
        },
        None => p.to_token_stream().to_string(),
    }
}

/// 合并必需派生与已有派生（去重，required 在前）
fn merge_derives(existing: Vec<Path>, required: Vec<Path>) -> Attribute {
    let mut seen = HashSet::<String>::new();
    let merged: Vec<Path> = required
        .into_iter()
        .chain(existing)
        .filter(|p| seen.insert(derive_key(p)))
        .collect();
    syn::parse_quote!(#[derive(#(#merged),*)])
}

/// 在 attrs 上应用派生合并，合并后的 derive 置于最前，
/// 保证 `#[serde(...)]` 等辅助属性位于 derive 之后
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<Path>) {
    let (retained, existing) = split_derives(attrs);
    let merged = merge_derives(existing, required);
    *attrs = std::iter::once(merged).chain(retained).collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_paths_are_deduplicated() {
        let mut attrs: Vec<Attribute> = vec![syn::parse_quote!(#[derive(Serialize, Copy)])];
        apply_derives(
            &mut attrs,
            vec![syn::parse_quote!(Clone), syn::parse_quote!(serde::Serialize)],
        );
        assert_eq!(attrs.len(), 1);
        let rendered = attrs[0].to_token_stream().to_string();
        assert!(rendered.contains("Clone"));
        assert!(rendered.contains("Copy"));
        assert_eq!(rendered.matches("Serialize").count(), 1);
    }
}
