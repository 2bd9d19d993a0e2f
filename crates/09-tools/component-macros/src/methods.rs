//! `#[component_methods]` 实现
//!
//! 从 impl 块中收集 `#[autowire]` 构造函数和 `#[post_construct]` 回调，
//! 生成供 `#[derive(Component)]` 调用的隐藏方法 `__component_methods`。

use crate::utils::{expect_string, extract_wrapped_type, is_result_type, take_attributes};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{FnArg, ImplItem, ImplItemFn, ItemImpl, LitStr, Pat, Result, ReturnType};

fn returns_result(method: &ImplItemFn) -> bool {
    match &method.sig.output {
        ReturnType::Default => false,
        ReturnType::Type(_, ty) => is_result_type(ty),
    }
}

fn parse_qualifier(attr: &syn::Attribute) -> Result<LitStr> {
    let value: syn::Expr = attr.parse_args()?;
    expect_string(&value)
}

/// 把 `#[autowire]` 构造函数转换为 `injectable_constructor` 调用
fn constructor_registration(method: &mut ImplItemFn) -> Result<TokenStream> {
    let name = method.sig.ident.clone();
    let label = name.to_string();

    let mut points = Vec::new();
    let mut takes = Vec::new();
    let mut arguments = Vec::new();

    for (index, input) in method.sig.inputs.iter_mut().enumerate() {
        let param = match input {
            FnArg::Typed(param) => param,
            FnArg::Receiver(receiver) => {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "#[autowire] 构造函数不能带 self 参数",
                ))
            }
        };

        let qualifier = match take_attributes(&mut param.attrs, "qualifier").first() {
            Some(attr) => Some(parse_qualifier(attr)?),
            None => None,
        };

        let param_name = match param.pat.as_ref() {
            Pat::Ident(pat) => pat.ident.to_string(),
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "#[autowire] 构造函数参数必须是简单标识符",
                ))
            }
        };

        let dependency = extract_wrapped_type(&param.ty, "Arc").ok_or_else(|| {
            syn::Error::new_spanned(&param.ty, "#[autowire] 构造函数参数类型必须是 Arc<T>")
        })?;

        let point = quote! {
            ::infrastructure_common::InjectionPoint::of::<#dependency>(#param_name)
        };
        points.push(match qualifier {
            Some(qualifier) => quote! { #point.qualifier(#qualifier) },
            None => point,
        });

        let binding = quote::format_ident!("__arg{}", index);
        takes.push(quote! { let #binding = dependencies.take::<#dependency>()?; });
        arguments.push(binding);
    }

    let call = quote! { Self::#name(#(#arguments),*) };
    let body = if returns_result(method) {
        quote! { ::std::result::Result::Ok(#call?) }
    } else {
        quote! { ::std::result::Result::Ok(#call) }
    };

    Ok(quote! {
        .injectable_constructor(
            #label,
            ::std::vec![#(#points),*],
            |dependencies: &mut ::infrastructure_common::Dependencies|
                -> ::std::result::Result<Self, ::infrastructure_common::BoxError> {
                #(#takes)*
                #body
            },
        )
    })
}

/// 把 `#[post_construct]` 方法转换为 `post_construct` 调用
fn hook_registration(method: &ImplItemFn) -> Result<TokenStream> {
    let name = &method.sig.ident;
    let label = name.to_string();

    let takes_ref_self = matches!(
        method.sig.inputs.first(),
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() && receiver.mutability.is_none()
    );
    if !takes_ref_self || method.sig.inputs.len() != 1 {
        return Err(syn::Error::new_spanned(
            &method.sig,
            "#[post_construct] 方法必须只接受 &self",
        ));
    }

    let body = if returns_result(method) {
        quote! { ::std::result::Result::Ok(this.#name()?) }
    } else {
        quote! {
            this.#name();
            ::std::result::Result::Ok(())
        }
    };

    Ok(quote! {
        .post_construct(
            #label,
            |this: &Self| -> ::std::result::Result<(), ::infrastructure_common::BoxError> {
                #body
            },
        )
    })
}

/// 实现 #[component_methods] 宏
pub fn component_methods_impl(mut item: ItemImpl) -> Result<TokenStream> {
    if item.trait_.is_some() {
        return Err(syn::Error::new_spanned(
            &item.self_ty,
            "#[component_methods] 只能用于固有 impl 块",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "组件不能带泛型参数",
        ));
    }

    let mut registrations = Vec::new();
    for impl_item in &mut item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };

        if !take_attributes(&mut method.attrs, "autowire").is_empty() {
            registrations.push(constructor_registration(method)?);
        }
        if !take_attributes(&mut method.attrs, "post_construct").is_empty() {
            registrations.push(hook_registration(method)?);
        }
    }

    let self_ty = &item.self_ty;
    Ok(quote! {
        #item

        impl #self_ty {
            #[doc(hidden)]
            pub fn __component_methods(
                builder: ::infrastructure_common::TypeDescriptorBuilder<Self>,
            ) -> ::infrastructure_common::TypeDescriptorBuilder<Self> {
                builder
                    #(#registrations)*
            }
        }
    })
}
