use syn::{Field, FieldsNamed, Token, punctuated::Punctuated};

fn field_is(f: &Field, name: &str) -> bool {
    f.ident.as_ref().map(|i| i == name).unwrap_or(false)
}

/// 确保具名字段结构体以给定字段开头
/// - 若已存在同名字段，复用原定义并移至最前
/// - 否则插入 `injected`
/// 其余字段保持原有相对顺序
pub(crate) fn ensure_leading_field(fields_named: &mut FieldsNamed, injected: Field) {
    let Some(name) = injected.ident.as_ref().map(|i| i.to_string()) else {
        return;
    };

    let old_named = fields_named.named.clone();
    let mut new_named: Punctuated<Field, Token![,]> = Punctuated::new();

    match old_named.iter().find(|f| field_is(f, &name)) {
        Some(existing) => new_named.push(existing.clone()),
        None => new_named.push(injected),
    }

    for f in old_named.into_iter() {
        if !field_is(&f, &name) {
            new_named.push(f);
        }
    }

    fields_named.named = new_named;
}

/// `RoleGroup` -> `role_group`
pub(crate) fn to_snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, ch) in ident.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
