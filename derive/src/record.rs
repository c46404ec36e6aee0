use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Fields, GenericArgument, Ident, LitStr, PathArguments, Type,
    Visibility,
};

// derive_record
pub fn derive_record(input: TokenStream) -> TokenStream {
    match expand(input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

///
/// FieldShape
///

enum FieldShape<'a> {
    Scalar(&'a Type),
    Optional(&'a Type),
    Record,
    OptionalRecord,
    Flatten(&'a Type),
    Opaque,
}

///
/// FieldSpec
///

struct FieldSpec<'a> {
    ident: &'a Ident,
    name: String,
    alias: Option<LitStr>,
    exported: bool,
    shape: FieldShape<'a>,
}

#[derive(Default)]
struct FieldAttrs {
    alias: Option<LitStr>,
    nested: bool,
    flatten: bool,
    skip: bool,
}

fn expand(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = syn::parse2(input)?;
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(Error::new_spanned(
                    other,
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                ident,
                "Record can only be derived for structs with named fields",
            ))
        }
    };

    let specs = fields
        .iter()
        .map(field_spec)
        .collect::<syn::Result<Vec<_>>>()?;

    let count = specs.len();
    let type_name = ident.to_string();
    let defs = specs.iter().map(field_def);
    let flattened = specs.iter().enumerate().filter_map(|(slot, spec)| match spec.shape {
        FieldShape::Flatten(ty) => Some(quote! {
            (#slot, <#ty as ::record_patch::schema::Record>::describe())
        }),
        _ => None,
    });

    let field_arms = specs.iter().enumerate().filter_map(|(slot, spec)| field_arm(slot, spec));
    let set_arms = specs.iter().enumerate().filter_map(|(slot, spec)| set_arm(slot, spec));
    let clear_arms = specs.iter().enumerate().filter_map(|(slot, spec)| clear_arm(slot, spec));
    let record_mut_arms = specs
        .iter()
        .enumerate()
        .filter_map(|(slot, spec)| record_mut_arm(slot, spec, false));
    let insert_arms = specs
        .iter()
        .enumerate()
        .filter_map(|(slot, spec)| record_mut_arm(slot, spec, true));

    Ok(quote! {
        #[automatically_derived]
        #[allow(unused_imports, unused_variables, unreachable_patterns)]
        impl ::record_patch::schema::Record for #ident {
            fn describe() -> &'static ::record_patch::schema::Catalog {
                static FIELDS: [::record_patch::schema::FieldDef; #count] = [#(#defs),*];
                static CATALOG: ::record_patch::__private::OnceCell<::record_patch::schema::Catalog> =
                    ::record_patch::__private::OnceCell::new();

                CATALOG.get_or_init(|| {
                    ::record_patch::schema::Catalog::build(
                        #type_name,
                        &FIELDS,
                        ::std::vec![#(#flattened),*],
                    )
                })
            }

            fn catalog(&self) -> &'static ::record_patch::schema::Catalog {
                <Self as ::record_patch::schema::Record>::describe()
            }

            fn field(&self, slot: usize) -> ::record_patch::schema::FieldRef<'_> {
                use ::record_patch::schema::{FieldRef, Record, ScalarField};

                match slot {
                    #(#field_arms)*
                    _ => FieldRef::Opaque,
                }
            }

            fn set(
                &mut self,
                slot: usize,
                value: ::record_patch::schema::Scalar,
            ) -> ::core::result::Result<(), ::record_patch::schema::AssignError> {
                use ::record_patch::schema::{AssignError, ScalarField};

                match slot {
                    #(#set_arms)*
                    _ if slot < #count => ::core::result::Result::Err(AssignError::NotWritable),
                    _ => ::core::result::Result::Err(AssignError::UnknownSlot(slot)),
                }
            }

            fn clear(
                &mut self,
                slot: usize,
            ) -> ::core::result::Result<(), ::record_patch::schema::AssignError> {
                use ::record_patch::schema::AssignError;

                match slot {
                    #(#clear_arms)*
                    _ if slot < #count => ::core::result::Result::Err(AssignError::NotWritable),
                    _ => ::core::result::Result::Err(AssignError::UnknownSlot(slot)),
                }
            }

            fn record_mut(
                &mut self,
                slot: usize,
            ) -> ::core::option::Option<&mut dyn ::record_patch::schema::Record> {
                use ::record_patch::schema::Record;

                match slot {
                    #(#record_mut_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn insert_record(
                &mut self,
                slot: usize,
            ) -> ::core::option::Option<&mut dyn ::record_patch::schema::Record> {
                use ::record_patch::schema::Record;

                match slot {
                    #(#insert_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

fn field_spec(field: &syn::Field) -> syn::Result<FieldSpec<'_>> {
    let ident = field.ident.as_ref().expect("named field");
    let attrs = parse_attrs(field)?;
    let name = ident.to_string().trim_start_matches("r#").to_string();
    let exported = matches!(field.vis, Visibility::Public(_)) && !attrs.skip;

    let shape = if !exported {
        FieldShape::Opaque
    } else if attrs.flatten {
        if option_inner(&field.ty).is_some() {
            return Err(Error::new_spanned(
                &field.ty,
                "flattened fields cannot be optional",
            ));
        }
        FieldShape::Flatten(&field.ty)
    } else if attrs.nested {
        match option_inner(&field.ty) {
            Some(_) => FieldShape::OptionalRecord,
            None => FieldShape::Record,
        }
    } else {
        match option_inner(&field.ty) {
            Some(inner) => FieldShape::Optional(inner),
            None => FieldShape::Scalar(&field.ty),
        }
    };

    Ok(FieldSpec {
        ident,
        name,
        alias: attrs.alias,
        exported,
        shape,
    })
}

fn parse_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("patch") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("alias") {
                attrs.alias = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("nested") {
                attrs.nested = true;
            } else if meta.path.is_ident("flatten") {
                attrs.flatten = true;
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
            } else {
                return Err(meta.error(
                    "unsupported patch attribute, expected `alias`, `nested`, `flatten` or `skip`",
                ));
            }
            Ok(())
        })?;
    }

    if attrs.nested && attrs.flatten {
        return Err(Error::new_spanned(
            field,
            "`nested` and `flatten` cannot be combined",
        ));
    }

    Ok(attrs)
}

fn field_def(spec: &FieldSpec<'_>) -> TokenStream {
    let name = &spec.name;
    let exported = spec.exported;
    let alias = match &spec.alias {
        Some(lit) => quote!(::core::option::Option::Some(#lit)),
        None => quote!(::core::option::Option::None),
    };
    let shape = match spec.shape {
        FieldShape::Scalar(ty) => quote! {
            ::record_patch::schema::Shape::Scalar(<#ty as ::record_patch::schema::ScalarField>::KIND)
        },
        FieldShape::Optional(ty) => quote! {
            ::record_patch::schema::Shape::Optional(<#ty as ::record_patch::schema::ScalarField>::KIND)
        },
        FieldShape::Record => quote!(::record_patch::schema::Shape::Record),
        FieldShape::OptionalRecord => quote!(::record_patch::schema::Shape::OptionalRecord),
        FieldShape::Flatten(_) => quote!(::record_patch::schema::Shape::Flatten),
        FieldShape::Opaque => quote!(::record_patch::schema::Shape::Opaque),
    };

    quote! {
        ::record_patch::schema::FieldDef {
            name: #name,
            alias: #alias,
            exported: #exported,
            shape: #shape,
        }
    }
}

fn field_arm(slot: usize, spec: &FieldSpec<'_>) -> Option<TokenStream> {
    let ident = spec.ident;
    let body = match spec.shape {
        FieldShape::Scalar(ty) => quote! {
            FieldRef::Scalar(<#ty as ScalarField>::to_scalar(&self.#ident))
        },
        FieldShape::Optional(ty) => quote! {
            FieldRef::Optional(self.#ident.as_ref().map(<#ty as ScalarField>::to_scalar))
        },
        FieldShape::Record | FieldShape::Flatten(_) => quote! {
            FieldRef::Record(&self.#ident as &dyn Record)
        },
        FieldShape::OptionalRecord => quote! {
            FieldRef::OptionalRecord(self.#ident.as_ref().map(|r| r as &dyn Record))
        },
        FieldShape::Opaque => return None,
    };

    Some(quote!(#slot => #body,))
}

fn set_arm(slot: usize, spec: &FieldSpec<'_>) -> Option<TokenStream> {
    let ident = spec.ident;
    let body = match spec.shape {
        FieldShape::Scalar(ty) => quote! {
            self.#ident = <#ty as ScalarField>::from_scalar(value)?;
        },
        FieldShape::Optional(ty) => quote! {
            self.#ident = ::core::option::Option::Some(<#ty as ScalarField>::from_scalar(value)?);
        },
        _ => return None,
    };

    Some(quote! {
        #slot => {
            #body
            ::core::result::Result::Ok(())
        }
    })
}

fn clear_arm(slot: usize, spec: &FieldSpec<'_>) -> Option<TokenStream> {
    let ident = spec.ident;
    match spec.shape {
        FieldShape::Optional(_) | FieldShape::OptionalRecord => Some(quote! {
            #slot => {
                self.#ident = ::core::option::Option::None;
                ::core::result::Result::Ok(())
            }
        }),
        _ => None,
    }
}

fn record_mut_arm(slot: usize, spec: &FieldSpec<'_>, insert: bool) -> Option<TokenStream> {
    let ident = spec.ident;
    match spec.shape {
        FieldShape::Record | FieldShape::Flatten(_) => Some(quote! {
            #slot => ::core::option::Option::Some(&mut self.#ident as &mut dyn Record),
        }),
        FieldShape::OptionalRecord if insert => Some(quote! {
            #slot => ::core::option::Option::Some(
                self.#ident.get_or_insert_with(::core::default::Default::default) as &mut dyn Record,
            ),
        }),
        FieldShape::OptionalRecord => Some(quote! {
            #slot => self.#ident.as_mut().map(|r| r as &mut dyn Record),
        }),
        _ => None,
    }
}

/// Returns `T` for a field declared as `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
