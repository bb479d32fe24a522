use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::quote;
use syn::{DataStruct, DeriveInput, Field, LitBool, LitStr, Path, Result, Type};

#[derive(Default)]
struct EntityOptions {
    alias: Option<String>,
    supertypes: Vec<Path>,
    write_type_hint: Option<bool>,
    store_id_in_source: Option<bool>,
    store_version_in_source: Option<bool>,
}

#[derive(Default)]
struct FieldOptions {
    field_name: Option<String>,
    id: bool,
    version: bool,
    seq_no: bool,
    index_name: bool,
    routing: bool,
    read_only: bool,
    write_only: bool,
    skip: bool,
    store_null: bool,
    store_empty: Option<bool>,
    format: Option<String>,
    constructor: bool,
    expression: Option<String>,
    scripted: Option<String>,
    declared: Option<Type>,
}

fn parse_bool(meta: &syn::meta::ParseNestedMeta) -> Result<bool> {
    if meta.input.peek(syn::Token![=]) {
        let value: LitBool = meta.value()?.parse()?;
        Ok(value.value)
    } else {
        Ok(true)
    }
}

fn parse_entity_options(ast: &DeriveInput) -> Result<EntityOptions> {
    let mut options = EntityOptions::default();
    for attr in &ast.attrs {
        if attr.path().is_ident("mapping") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("alias") {
                    let s: LitStr = meta.value()?.parse()?;
                    options.alias = Some(s.value());
                    Ok(())
                } else if meta.path.is_ident("supertype") {
                    let path: Path = meta.value()?.parse()?;
                    options.supertypes.push(path);
                    Ok(())
                } else if meta.path.is_ident("write_type_hint") {
                    options.write_type_hint = Some(parse_bool(&meta)?);
                    Ok(())
                } else if meta.path.is_ident("store_id_in_source") {
                    options.store_id_in_source = Some(parse_bool(&meta)?);
                    Ok(())
                } else if meta.path.is_ident("store_version_in_source") {
                    options.store_version_in_source = Some(parse_bool(&meta)?);
                    Ok(())
                } else {
                    Err(meta.error("Unknown mapping attribute"))
                }
            })?
        }
    }
    Ok(options)
}

fn parse_field_options(field: &Field) -> Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in &field.attrs {
        if attr.path().is_ident("mapping") {
            attr.parse_nested_meta(|meta| {
                let path = &meta.path;
                if path.is_ident("field") {
                    let s: LitStr = meta.value()?.parse()?;
                    options.field_name = Some(s.value());
                } else if path.is_ident("id") {
                    options.id = true;
                } else if path.is_ident("version") {
                    options.version = true;
                } else if path.is_ident("seq_no") {
                    options.seq_no = true;
                } else if path.is_ident("index_name") {
                    options.index_name = true;
                } else if path.is_ident("routing") {
                    options.routing = true;
                } else if path.is_ident("read_only") {
                    options.read_only = true;
                } else if path.is_ident("write_only") {
                    options.write_only = true;
                } else if path.is_ident("skip") {
                    options.skip = true;
                } else if path.is_ident("store_null") {
                    options.store_null = parse_bool(&meta)?;
                } else if path.is_ident("store_empty") {
                    options.store_empty = Some(parse_bool(&meta)?);
                } else if path.is_ident("format") {
                    let s: LitStr = meta.value()?.parse()?;
                    options.format = Some(s.value());
                } else if path.is_ident("constructor") {
                    options.constructor = true;
                } else if path.is_ident("expression") {
                    let s: LitStr = meta.value()?.parse()?;
                    options.expression = Some(s.value());
                } else if path.is_ident("scripted") {
                    let s: LitStr = meta.value()?.parse()?;
                    options.scripted = Some(s.value());
                } else if path.is_ident("declared") {
                    let ty: Type = meta.value()?.parse()?;
                    options.declared = Some(ty);
                } else {
                    return Err(meta.error("Unknown mapping attribute"));
                }
                Ok(())
            })?
        }
    }
    Ok(options)
}

fn property_name(ident: &Ident) -> String {
    let name = ident.to_string();
    name.strip_prefix("r#").map(str::to_string).unwrap_or(name)
}

pub(crate) fn generate_entity_for_struct(
    ast: &DeriveInput,
    data: &DataStruct,
) -> Result<TokenStream> {
    let name = &ast.ident;
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "generic entities are not supported",
        ));
    }

    let fields: Vec<&Field> = match &data.fields {
        syn::Fields::Named(fields) => fields.named.iter().collect(),
        _ => {
            return Err(syn::Error::new_spanned(
                ast,
                "only structs with named fields are supported",
            ))
        }
    };

    let entity = parse_entity_options(ast)?;

    let mut getters = Vec::new();
    let mut setters = Vec::new();
    let mut descriptors = Vec::new();
    let mut initializers = Vec::new();
    let mut constructor = Vec::new();

    for field in fields {
        let ident = field.ident.as_ref().ok_or_else(|| {
            syn::Error::new_spanned(field, "only named fields are supported")
        })?;
        let ty = &field.ty;
        let options = parse_field_options(field)?;

        if options.skip {
            initializers.push(quote! { #ident: ::std::default::Default::default() });
            continue;
        }

        let property = property_name(ident);

        getters.push(quote! {
            #property => docmap::common::Convertible::to_object(&self.#ident),
        });
        setters.push(quote! {
            #property => {
                self.#ident = docmap::common::from_object_or_default::<#ty>(value)?;
                Ok(())
            }
        });

        if options.constructor {
            constructor.push(property.clone());
            initializers.push(quote! {
                #ident: docmap::common::from_object_or_default::<#ty>(parameters.value(#property)?)?
            });
        } else {
            initializers.push(quote! { #ident: ::std::default::Default::default() });
        }

        let type_ref = match &options.declared {
            Some(declared) => quote! {
                <#ty as docmap::common::Convertible>::type_ref()
                    .specialize(&<#declared as docmap::common::Convertible>::type_ref())
            },
            None => quote! { <#ty as docmap::common::Convertible>::type_ref() },
        };

        let mut builder = quote! {
            docmap::metadata::PropertyDescriptor::builder(#property, #type_ref)
        };
        if let Some(field_name) = &options.field_name {
            builder = quote! { #builder.field_name(#field_name) };
        }
        if options.id {
            builder = quote! { #builder.id() };
        }
        if options.version {
            builder = quote! { #builder.version() };
        }
        if options.seq_no {
            builder = quote! { #builder.seq_no_primary_term() };
        }
        if options.index_name {
            builder = quote! { #builder.index_name() };
        }
        if options.routing {
            builder = quote! { #builder.routing() };
        }
        if options.read_only {
            builder = quote! { #builder.read_only() };
        }
        if options.write_only {
            builder = quote! { #builder.write_only() };
        }
        if options.store_null {
            builder = quote! { #builder.store_null(true) };
        }
        if let Some(store_empty) = options.store_empty {
            builder = quote! { #builder.store_empty(#store_empty) };
        }
        if let Some(format) = &options.format {
            builder = quote! { #builder.date_formats(#format) };
        }
        if let Some(expression) = &options.expression {
            builder = quote! { #builder.expression(#expression) };
        }
        if let Some(scripted) = &options.scripted {
            builder = quote! { #builder.script_field(#scripted) };
        }
        descriptors.push(quote! { .property(#builder.build()?) });
    }

    let mut metadata = quote! {
        docmap::metadata::EntityMetadata::builder(
            <Self as docmap::metadata::MappedEntity>::TYPE_NAME,
            factory,
        )
    };
    if let Some(alias) = &entity.alias {
        metadata = quote! { #metadata.alias(#alias) };
    }
    for supertype in &entity.supertypes {
        metadata = quote! {
            #metadata.supertype(<#supertype as docmap::metadata::MappedEntity>::TYPE_NAME)
        };
    }
    if !constructor.is_empty() {
        metadata = quote! { #metadata.constructor(&[#(#constructor),*]) };
    }
    if let Some(flag) = entity.write_type_hint {
        metadata = quote! { #metadata.write_type_hint(#flag) };
    }
    if let Some(flag) = entity.store_id_in_source {
        metadata = quote! { #metadata.store_id_in_source(#flag) };
    }
    if let Some(flag) = entity.store_version_in_source {
        metadata = quote! { #metadata.store_version_in_source(#flag) };
    }

    let parameters = if constructor.is_empty() {
        quote! { _parameters }
    } else {
        quote! { parameters }
    };

    let gen = quote! {
        impl docmap::metadata::Entity for #name {
            fn type_name(&self) -> &str {
                <Self as docmap::metadata::MappedEntity>::TYPE_NAME
            }

            fn get_property(&self, name: &str) -> docmap::errors::MappingResult<docmap::common::Object> {
                match name {
                    #(#getters)*
                    _ => Err(docmap::errors::MappingError::new(
                        &format!("{} has no property {}", <Self as docmap::metadata::MappedEntity>::TYPE_NAME, name),
                        docmap::errors::ErrorKind::InvalidOperation,
                    )),
                }
            }

            fn set_property(
                &mut self,
                name: &str,
                value: docmap::common::Object,
            ) -> docmap::errors::MappingResult<()> {
                match name {
                    #(#setters)*
                    _ => Err(docmap::errors::MappingError::new(
                        &format!("{} has no property {}", <Self as docmap::metadata::MappedEntity>::TYPE_NAME, name),
                        docmap::errors::ErrorKind::InvalidOperation,
                    )),
                }
            }
        }

        impl docmap::metadata::MappedEntity for #name {
            const TYPE_NAME: &'static str = concat!(module_path!(), "::", stringify!(#name));

            fn entity_metadata() -> docmap::errors::MappingResult<docmap::metadata::EntityMetadata> {
                let factory: docmap::metadata::EntityFactory = ::std::sync::Arc::new(
                    |#parameters: &mut dyn docmap::metadata::ParameterValueProvider|
                        -> docmap::errors::MappingResult<Box<dyn docmap::metadata::Entity>> {
                        Ok(Box::new(#name {
                            #(#initializers,)*
                        }))
                    },
                );

                #metadata
                    #(#descriptors)*
                    .build()
            }
        }

        impl docmap::common::Convertible for #name {
            fn type_ref() -> docmap::common::TypeRef {
                docmap::common::TypeRef::entity(<Self as docmap::metadata::MappedEntity>::TYPE_NAME)
            }

            fn to_object(&self) -> docmap::errors::MappingResult<docmap::common::Object> {
                Ok(docmap::common::Object::entity(::std::clone::Clone::clone(self)))
            }

            fn from_object(object: docmap::common::Object) -> docmap::errors::MappingResult<Self> {
                docmap::common::entity_from_object::<Self>(object)
            }
        }
    };

    Ok(TokenStream::from(gen))
}
