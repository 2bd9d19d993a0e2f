//! 宏工具函数

use proc_macro2::Span;
use syn::{Attribute, Expr, GenericArgument, Ident, Lit, LitStr, PathArguments, Result, Type};

/// 从包装类型中提取泛型参数
///
/// 只匹配最后一段路径名为 `wrapper` 的类型，例如 `Autowired<dyn Horn>` 或
/// `std::sync::Arc<Engine>`。
pub fn extract_wrapped_type<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first() {
            Some(GenericArgument::Type(inner_type)) => Some(inner_type),
            _ => None,
        },
        _ => None,
    }
}

/// 检查类型是否为 Result<T, E>
pub fn is_result_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident == "Result")
            .unwrap_or(false),
        _ => false,
    }
}

/// 检查属性列表中是否有指定名称的属性
pub fn has_attribute(attrs: &[Attribute], attr_name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(attr_name))
}

/// 移除指定名称的属性，返回被移除的属性
pub fn take_attributes(attrs: &mut Vec<Attribute>, attr_name: &str) -> Vec<Attribute> {
    let (taken, kept) = std::mem::take(attrs)
        .into_iter()
        .partition(|attr| attr.path().is_ident(attr_name));
    *attrs = kept;
    taken
}

/// 解析 `name = "value"` 中的字符串值
pub fn expect_string(expr: &Expr) -> Result<LitStr> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(lit_str) => Ok(lit_str.clone()),
            other => Err(syn::Error::new_spanned(other, "期望字符串字面量")),
        },
        other => Err(syn::Error::new_spanned(other, "期望字符串字面量")),
    }
}

/// 组件注册函数名
pub fn registration_ident(struct_name: &Ident) -> Ident {
    Ident::new(
        &format!(
            "__register_component_{}",
            struct_name.to_string().to_lowercase()
        ),
        Span::call_site(),
    )
}
