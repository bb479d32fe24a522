use proc_macro::TokenStream;
use quote::quote;
use syn::{DataEnum, DeriveInput, Fields, LitStr, Result};

fn variant_name(variant: &syn::Variant) -> Result<String> {
    let mut name = variant.ident.to_string();
    for attr in &variant.attrs {
        if attr.path().is_ident("mapping") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let s: LitStr = meta.value()?.parse()?;
                    name = s.value();
                    Ok(())
                } else {
                    Err(meta.error("Unknown mapping attribute"))
                }
            })?;
        }
    }
    Ok(name)
}

pub(crate) fn generate_convertible_for_enum(
    ast: &DeriveInput,
    data: &DataEnum,
) -> Result<TokenStream> {
    let name = &ast.ident;
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "generic enums are not supported",
        ));
    }

    let mut names = Vec::new();
    let mut to_arms = Vec::new();
    let mut from_arms = Vec::new();

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "only unit variants are supported",
            ));
        }
        let ident = &variant.ident;
        let stored = variant_name(variant)?;
        if names.contains(&stored) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("duplicate variant name '{}'", stored),
            ));
        }

        to_arms.push(quote! { #name::#ident => #stored, });
        from_arms.push(quote! { #stored => Ok(#name::#ident), });
        names.push(stored);
    }

    let gen = quote! {
        impl #name {
            pub const ENUM_TYPE: docmap::common::EnumType = docmap::common::EnumType::new(
                concat!(module_path!(), "::", stringify!(#name)),
                &[#(#names),*],
            );
        }

        impl docmap::common::Convertible for #name {
            fn type_ref() -> docmap::common::TypeRef {
                docmap::common::TypeRef::Enum(Self::ENUM_TYPE)
            }

            fn to_object(&self) -> docmap::errors::MappingResult<docmap::common::Object> {
                let variant = match self {
                    #(#to_arms)*
                };
                Ok(docmap::common::Object::Enum(
                    docmap::common::EnumValue::new(Self::ENUM_TYPE, variant)?,
                ))
            }

            fn from_object(object: docmap::common::Object) -> docmap::errors::MappingResult<Self> {
                let value = match object {
                    docmap::common::Object::Enum(value) => value,
                    docmap::common::Object::String(name) => {
                        docmap::common::EnumValue::new(Self::ENUM_TYPE, &name)?
                    }
                    other => {
                        return Err(docmap::errors::MappingError::new(
                            &format!("Object {} is not a {}", other, Self::ENUM_TYPE.name),
                            docmap::errors::ErrorKind::InvalidDataType,
                        ));
                    }
                };
                match value.name() {
                    #(#from_arms)*
                    unknown => Err(docmap::errors::MappingError::new(
                        &format!("'{}' is not a variant of {}", unknown, Self::ENUM_TYPE.name),
                        docmap::errors::ErrorKind::ConversionError,
                    )),
                }
            }
        }
    };

    Ok(TokenStream::from(gen))
}
