//! `#[derive(Component)]` 实现

use crate::utils::{expect_string, extract_wrapped_type, has_attribute, registration_ident};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    punctuated::Punctuated, Data, DeriveInput, Expr, Fields, Ident, LitBool, LitStr, Result,
    Token, Type,
};

/// `#[component(...)]` 参数
#[derive(Default)]
pub struct ComponentArgs {
    /// 实现的契约
    pub implements: Vec<Type>,
    /// 自定义默认构造函数
    pub constructor: Option<Expr>,
    /// 父类型字段
    pub extends: Option<Ident>,
    /// 是否提交到全局组件清单
    pub scan: bool,
    /// 是否由 `#[component_methods]` 提供构造函数和回调
    pub methods: bool,
}

impl ComponentArgs {
    fn from_input(input: &DeriveInput) -> Result<Self> {
        let mut args = ComponentArgs {
            scan: true,
            ..ComponentArgs::default()
        };

        for attr in input.attrs.iter().filter(|a| a.path().is_ident("component")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("implements") {
                    let content;
                    syn::parenthesized!(content in meta.input);
                    let contracts = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
                    args.implements.extend(contracts);
                } else if meta.path.is_ident("constructor") {
                    args.constructor = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("extends") {
                    args.extends = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("scan") {
                    let value: LitBool = meta.value()?.parse()?;
                    args.scan = value.value;
                } else if meta.path.is_ident("methods") {
                    args.methods = true;
                } else {
                    return Err(meta.error("未知的 component 参数"));
                }
                Ok(())
            })?;
        }

        Ok(args)
    }
}

/// 被 `#[autowired]` 标记的字段
struct AutowiredField {
    name: Ident,
    dependency: Type,
    qualifier: Option<LitStr>,
}

fn autowired_fields(input: &DeriveInput) -> Result<Vec<AutowiredField>> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(Component)] 只能用于结构体",
        ));
    };

    let fields = match &data.fields {
        Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(unnamed) => {
            if unnamed.unnamed.iter().any(|f| has_attribute(&f.attrs, "autowired")) {
                return Err(syn::Error::new_spanned(unnamed, "#[autowired] 字段必须具名"));
            }
            Vec::new()
        }
    };

    let mut result = Vec::new();
    for field in fields {
        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("autowired")) else {
            continue;
        };
        let Some(name) = field.ident.clone() else {
            continue;
        };

        let dependency = extract_wrapped_type(&field.ty, "Autowired")
            .cloned()
            .ok_or_else(|| {
                syn::Error::new_spanned(&field.ty, "#[autowired] 字段类型必须是 Autowired<T>")
            })?;

        let mut qualifier = None;
        if matches!(attr.meta, syn::Meta::List(_)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("qualifier") {
                    let value: Expr = meta.value()?.parse()?;
                    qualifier = Some(expect_string(&value)?);
                    Ok(())
                } else {
                    Err(meta.error("未知的 autowired 参数"))
                }
            })?;
        }

        result.push(AutowiredField {
            name,
            dependency,
            qualifier,
        });
    }
    Ok(result)
}

fn extends_type(input: &DeriveInput, field_name: &Ident) -> Result<Type> {
    if let Data::Struct(data) = &input.data {
        if let Fields::Named(named) = &data.fields {
            if let Some(field) = named
                .named
                .iter()
                .find(|f| f.ident.as_ref() == Some(field_name))
            {
                return Ok(field.ty.clone());
            }
        }
    }
    Err(syn::Error::new_spanned(
        field_name,
        format!("找不到父类型字段 `{}`", field_name),
    ))
}

/// 实现 #[derive(Component)] 宏
pub fn derive_component_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "组件不能带泛型参数",
        ));
    }

    let args = ComponentArgs::from_input(&input)?;
    let fields = autowired_fields(&input)?;

    let contracts = args.implements.iter().map(|contract| {
        quote! {
            .implements::<#contract>(
                |this: ::std::sync::Arc<Self>| -> ::std::sync::Arc<#contract> { this }
            )
        }
    });

    // 没有 #[component_methods] 时默认使用 Default 构造
    let constructor = match (&args.constructor, args.methods) {
        (Some(path), _) => quote! { .default_constructor(#path) },
        (None, false) => quote! { .default_constructor(<Self as ::std::default::Default>::default) },
        (None, true) => quote! {},
    };

    let injected_fields = fields.iter().map(|field| {
        let name = &field.name;
        let dependency = &field.dependency;
        let label = name.to_string();
        match &field.qualifier {
            Some(qualifier) => quote! {
                .qualified_field::<#dependency, _>(#label, #qualifier, |this: &Self| &this.#name)
            },
            None => quote! {
                .field::<#dependency, _>(#label, |this: &Self| &this.#name)
            },
        }
    });

    let supertype = match &args.extends {
        Some(field_name) => {
            let base = extends_type(&input, field_name)?;
            quote! {
                .extends::<#base>(
                    <#base as ::infrastructure_common::ComponentDefinition>::descriptor(),
                    |this: &Self| &this.#field_name,
                )
            }
        }
        None => quote! {},
    };

    let methods = if args.methods {
        quote! { let builder = Self::__component_methods(builder); }
    } else {
        quote! {}
    };

    let registration = if args.scan {
        let register_fn = registration_ident(struct_name);
        quote! {
            const _: () = {
                #[::ctor::ctor]
                fn #register_fn() {
                    ::infrastructure_common::submit_component::<#struct_name>();
                }
            };
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl ::infrastructure_common::ComponentDefinition for #struct_name {
            fn descriptor() -> ::infrastructure_common::TypeDescriptor {
                let builder = ::infrastructure_common::TypeDescriptor::builder::<Self>()
                    #(#contracts)*
                    #constructor
                    #(#injected_fields)*
                    #supertype;
                #methods
                builder.build()
            }
        }

        #registration
    })
}
