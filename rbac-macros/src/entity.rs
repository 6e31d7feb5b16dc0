use crate::derive_utils::apply_derives;
use crate::field_utils::{ensure_leading_field, to_snake_case};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Field, Item, LitStr, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[entity] 宏实现
/// - 若缺失则在最前注入 `base: EntityBase`，并以 `#[serde(flatten)]` 展开到 JSON 顶层
/// - 合并派生：Debug（可关闭）、Clone、Default、Serialize、Deserialize
/// - 实现 `::rbac_domain::entity::Entity`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    let base_field: Field = syn::parse_quote! {
        #[serde(flatten)]
        base: ::rbac_domain::entity::EntityBase
    };
    ensure_leading_field(fields_named, base_field);

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(Default),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, required);

    let ident = &st.ident;
    let kind = cfg
        .kind
        .map(|lit| lit.value())
        .unwrap_or_else(|| to_snake_case(&ident.to_string()));
    let generics = st.generics.clone();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        #st

        impl #impl_generics ::rbac_domain::entity::Entity for #ident #ty_generics #where_clause {
            const KIND: &'static str = #kind;

            fn new(id: ::rbac_domain::snowflake::Id) -> Self {
                Self {
                    base: ::rbac_domain::entity::EntityBase::new(id),
                    ..::core::default::Default::default()
                }
            }

            fn base(&self) -> &::rbac_domain::entity::EntityBase { &self.base }

            fn base_mut(&mut self) -> &mut ::rbac_domain::entity::EntityBase { &mut self.base }
        }
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

struct EntityAttrConfig {
    kind: Option<LitStr>,
    derive_debug: Option<bool>,
}

impl Parse for EntityAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut kind: Option<LitStr> = None;
        let mut derive_debug: Option<bool> = None;

        if input.is_empty() {
            return Ok(Self { kind, derive_debug });
        }

        let elems: Punctuated<EntityAttrElem, Token![,]> = Punctuated::parse_terminated(input)?;

        for elem in elems {
            match elem {
                EntityAttrElem::Kind(lit) => {
                    if kind.is_some() {
                        return Err(syn::Error::new(lit.span(), "duplicate key 'kind' in attribute"));
                    }
                    kind = Some(lit);
                }
                EntityAttrElem::Debug(b) => {
                    if derive_debug.is_some() {
                        return Err(syn::Error::new(
                            proc_macro2::Span::call_site(),
                            "duplicate key 'debug' in attribute",
                        ));
                    }
                    derive_debug = Some(b);
                }
            }
        }

        Ok(Self { kind, derive_debug })
    }
}

enum EntityAttrElem {
    Kind(LitStr),
    Debug(bool),
}

impl Parse for EntityAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        if key == "kind" {
            Ok(EntityAttrElem::Kind(input.parse()?))
        } else if key == "debug" {
            let expr: syn::Expr = input.parse()?;
            match expr {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Bool(b),
                    ..
                }) => Ok(EntityAttrElem::Debug(b.value())),
                other => Err(syn::Error::new(
                    other.span(),
                    "expected boolean literal for 'debug'",
                )),
            }
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'kind' or 'debug'",
            ))
        }
    }
}
