use crate::derive_utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[value_object] 宏实现
/// - 支持结构体（具名或 tuple）与枚举
/// - 合并/追加派生：Default, Clone, (Debug 可控), Serialize, Deserialize, PartialEq, Eq
/// - 参数：
///   - `debug = true|false`，默认 true
///   - `try_from = Type`：反序列化经由 `TryFrom<Type>`，使校验在反序列化时同样生效
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as ValueObjectAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Default),
        syn::parse_quote!(Clone),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }

    let serde_attr: Option<syn::Attribute> = cfg.try_from.map(|ty| {
        let ty_str = quote!(#ty).to_string().replace(' ', "");
        syn::parse_quote!(#[serde(try_from = #ty_str)])
    });

    let attrs = match &mut input {
        Item::Struct(st) => &mut st.attrs,
        Item::Enum(en) => &mut en.attrs,
        other => {
            return syn::Error::new(other.span(), "#[value_object] only supports struct or enum")
                .to_compile_error()
                .into();
        }
    };
    apply_derives(attrs, required);
    if let Some(attr) = serde_attr {
        attrs.push(attr);
    }

    TokenStream::from(quote! { #input })
}

// -------- parsing --------

struct ValueObjectAttrConfig {
    derive_debug: Option<bool>,
    try_from: Option<Type>,
}

impl Parse for ValueObjectAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self {
            derive_debug: None,
            try_from: None,
        };
        if input.is_empty() {
            return Ok(cfg);
        }

        let pairs: Punctuated<ValueObjectAttrElem, Token![,]> = Punctuated::parse_terminated(input)?;

        for elem in pairs {
            match elem {
                ValueObjectAttrElem::Debug(b) => {
                    if cfg.derive_debug.replace(b).is_some() {
                        return Err(syn::Error::new(
                            proc_macro2::Span::call_site(),
                            "duplicate key 'debug' in attribute",
                        ));
                    }
                }
                ValueObjectAttrElem::TryFrom(ty) => {
                    let span = ty.span();
                    if cfg.try_from.replace(*ty).is_some() {
                        return Err(syn::Error::new(span, "duplicate key 'try_from' in attribute"));
                    }
                }
            }
        }
        Ok(cfg)
    }
}

enum ValueObjectAttrElem {
    Debug(bool),
    TryFrom(Box<Type>),
}

impl Parse for ValueObjectAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        if key == "debug" {
            let lit: syn::LitBool = input.parse()?;
            Ok(Self::Debug(lit.value()))
        } else if key == "try_from" {
            Ok(Self::TryFrom(Box::new(input.parse()?)))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'debug' or 'try_from'",
            ))
        }
    }
}
