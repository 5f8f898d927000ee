//! Derive macro for oxide-sqlgen model descriptors.
//!
//! This crate provides the `#[derive(Model)]` macro, which describes a struct's
//! fields to the SQL generator and adds checked field accessors.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, GenericArgument, Ident, Lit,
    Meta, PathArguments, Type,
};

/// Derives `oxide_sqlgen_core::model::Model` for a struct.
///
/// Field names are converted to `PascalCase` (`first_name` becomes
/// `FirstName`), which is also the default column name.
///
/// # Attributes
///
/// - `#[model(table = "table_name")]` - Table alias (optional, defaults to
///   the struct name)
///
/// # Field Attributes
///
/// - `#[field(identity)]` - Marks the field as the identity column
/// - `#[field(ignore)]` - Excludes the field from persistence
/// - `#[field(column = "column_name")]` - Stores the field under another column
/// - `#[field(ty = "Decimal")]` - Overrides the inferred semantic type
///
/// # Generated Items
///
/// For a struct `Person` with a field `age`, this macro generates:
///
/// - `impl Model for Person`, keyed by the struct's module path
/// - `Person::age() -> FieldRef`, for every persisted field
#[proc_macro_derive(Model, attributes(model, field))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_model_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_model_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let model_name = struct_name.to_string();
    let table_name = get_table_name(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Model derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model derive only supports structs",
            ));
        }
    };

    let mut field_infos: Vec<FieldInfo> = Vec::new();
    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_field_attrs(&field.attrs)?;
        let (inferred, nullable) = infer_semantic_type(&field.ty);
        let semantic = match attrs.ty {
            Some((name, span)) => semantic_from_name(&name, span)?,
            None => inferred,
        };

        field_infos.push(FieldInfo {
            ident: field_ident.clone(),
            name: to_pascal_case(&field_ident.to_string()),
            semantic,
            nullable,
            identity: attrs.identity,
            ignored: attrs.ignore,
            column: attrs.column,
        });
    }

    let field_descriptors: Vec<TokenStream2> = field_infos
        .iter()
        .map(|info| {
            let name = &info.name;
            let semantic = &info.semantic;
            let nullable = info.nullable.then(|| quote! { .nullable() });
            let identity = info.identity.then(|| quote! { .identity() });
            let ignored = info.ignored.then(|| quote! { .ignored() });
            let column = info.column.as_ref().map(|c| quote! { .column(#c) });
            quote! {
                .field(
                    ::oxide_sqlgen_core::model::FieldDescriptor::new(#name, #semantic)
                        #nullable #identity #ignored #column
                )
            }
        })
        .collect();

    // Accessors for persisted fields only
    let field_accessors: Vec<TokenStream2> = field_infos
        .iter()
        .filter(|info| !info.ignored)
        .map(|info| {
            let method_name = &info.ident;
            let name = &info.name;
            quote! {
                /// Returns a checked reference to this field.
                #[inline]
                pub const fn #method_name() -> ::oxide_sqlgen_core::model::FieldRef {
                    ::oxide_sqlgen_core::model::FieldRef::new(#name)
                }
            }
        })
        .collect();

    let table_alias = table_name.map(|t| quote! { .table(#t) });
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::oxide_sqlgen_core::model::Model for #struct_name #ty_generics #where_clause {
            fn descriptor() -> ::oxide_sqlgen_core::model::ModelDescriptor {
                ::oxide_sqlgen_core::model::ModelDescriptor::new(#model_name)
                    .with_key(::core::concat!(::core::module_path!(), "::", #model_name))
                    #table_alias
                    #(#field_descriptors)*
            }
        }

        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_accessors)*
        }
    };

    Ok(expanded)
}

struct FieldInfo {
    ident: Ident,
    name: String,
    semantic: TokenStream2,
    nullable: bool,
    identity: bool,
    ignored: bool,
    column: Option<String>,
}

#[derive(Default)]
struct FieldAttrs {
    identity: bool,
    ignore: bool,
    column: Option<String>,
    ty: Option<(String, proc_macro2::Span)>,
}

fn get_table_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    for attr in attrs {
        if attr.path().is_ident("model") {
            let mut table_name = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    table_name = Some(parse_str_value(&meta)?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported model attribute, expected `table`"))
                }
            })?;
            if table_name.is_some() {
                return Ok(table_name);
            }
        }
    }
    Ok(None)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if attr.path().is_ident("field") {
            // Handle empty attribute like #[field]
            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("identity") {
                    result.identity = true;
                } else if meta.path.is_ident("ignore") {
                    result.ignore = true;
                } else if meta.path.is_ident("column") {
                    result.column = Some(parse_str_value(&meta)?);
                } else if meta.path.is_ident("ty") {
                    let span = meta.path.get_ident().map_or_else(
                        proc_macro2::Span::call_site,
                        Ident::span,
                    );
                    result.ty = Some((parse_str_value(&meta)?, span));
                } else {
                    return Err(meta.error(
                        "unsupported field attribute, expected `identity`, `ignore`, `column` or `ty`",
                    ));
                }
                Ok(())
            })?;
        }
    }

    Ok(result)
}

fn parse_str_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<String> {
    let value: Expr = meta.value()?.parse()?;
    if let Expr::Lit(lit) = &value {
        if let Lit::Str(s) = &lit.lit {
            return Ok(s.value());
        }
    }
    Err(syn::Error::new_spanned(value, "expected a string literal"))
}

/// Maps a Rust type to a semantic type expression, unwrapping `Option`.
fn infer_semantic_type(ty: &Type) -> (TokenStream2, bool) {
    if let Some(inner) = generic_argument(ty, "Option") {
        let (semantic, _) = infer_semantic_type(inner);
        return (semantic, true);
    }
    (semantic_for(ty), false)
}

fn semantic_for(ty: &Type) -> TokenStream2 {
    if let Type::Reference(reference) = ty {
        if let Type::Path(path) = reference.elem.as_ref() {
            if path.path.is_ident("str") {
                return semantic_variant("String");
            }
        }
    }

    if let Some(inner) = generic_argument(ty, "Vec") {
        if matches!(inner, Type::Path(p) if p.path.is_ident("u8")) {
            return semantic_variant("Bytes");
        }
    }

    let variant = match last_segment(ty).as_deref() {
        Some("bool") => "Bool",
        Some("u8" | "i8") => "Byte",
        Some("i16" | "u16") => "Short",
        Some("i32" | "u32") => "Int",
        Some("i64" | "u64" | "isize" | "usize") => "Long",
        Some("f32") => "Float",
        Some("f64") => "Double",
        Some("String") => "String",
        Some("Uuid") => "Guid",
        Some("NaiveDateTime") => "DateTime",
        Some("DateTime") => "DateTimeOffset",
        Some("Decimal") => "Decimal",
        _ => {
            let name = quote!(#ty).to_string().replace(' ', "");
            return quote! {
                ::oxide_sqlgen_core::model::SemanticType::Custom(::std::string::String::from(#name))
            };
        }
    };
    semantic_variant(variant)
}

fn semantic_from_name(name: &str, span: proc_macro2::Span) -> syn::Result<TokenStream2> {
    const VARIANTS: &[&str] = &[
        "Bool",
        "Byte",
        "Short",
        "Int",
        "Long",
        "Float",
        "Double",
        "Decimal",
        "String",
        "Guid",
        "DateTime",
        "DateTimeOffset",
        "Bytes",
        "Enum",
    ];
    if VARIANTS.contains(&name) {
        Ok(semantic_variant(name))
    } else {
        Err(syn::Error::new(
            span,
            format!("unknown semantic type `{name}`, expected one of {VARIANTS:?}"),
        ))
    }
}

fn semantic_variant(name: &str) -> TokenStream2 {
    let variant = Ident::new(name, proc_macro2::Span::call_site());
    quote! { ::oxide_sqlgen_core::model::SemanticType::#variant }
}

fn last_segment(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    }
}

/// Returns `T` when `ty` is `<wrapper><T>`.
fn generic_argument<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    })
}

fn to_pascal_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = true;
    for c in s.trim_start_matches("r#").chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}
