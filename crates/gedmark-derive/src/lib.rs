//! Gedmark Derive Macros: Accessor Tables
//!
//! Rust has no runtime reflection, so a type tracked by a Gedmark marker tree
//! publishes its accessors explicitly. `#[derive(Accessible)]` generates that
//! table from the struct definition:
//!
//! - every field becomes a zero-argument accessor named after the field;
//! - struct-level `method(...)` entries add accessors that take arguments;
//! - result shapes come from each declared type's `Shaped::SHAPE`, so a
//!   field of another derived type is wrapped into a child branch.
//!
//! # Example
//!
//! ```ignore
//! use gedmark::Accessible;
//!
//! #[derive(Debug, Clone, Accessible)]
//! #[gedmark(method(name = "person", call = person_by_id, args(String), returns(Option<Person>)))]
//! struct Gedcom {
//!     people: Vec<Person>,
//!     #[gedmark(rename = "sources")]
//!     source_records: Vec<Source>,
//!     #[gedmark(skip)]
//!     index: HashMap<String, usize>,
//! }
//! ```
//!
//! # Attributes
//!
//! - `#[gedmark(skip)]` on a field: leave it out of the table
//! - `#[gedmark(rename = "name")]` on a field: override the accessor name
//! - `#[gedmark(method(name = "..", call = fn_name, args(T, ..), returns(R)))]`
//!   on the struct: add an accessor calling `self.fn_name(args..)`; `name`
//!   defaults to `call`, and several entries may share one `name`
//! - `fallible` inside `method(..)`: the method returns `Result<R, E>` with
//!   `E: Display`; errors become `AccessError::Failed`

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::punctuated::Punctuated;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident, Index, LitStr, Member, Token,
    Type,
};

/// Derive macro generating the `Accessible` and `Shaped` implementations.
///
/// The type must implement `Clone` and `Debug`: child branches own a clone
/// of the value they wrap.
#[proc_macro_derive(Accessible, attributes(gedmark))]
pub fn derive_accessible(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// One row of the generated accessor table
struct Entry {
    name: String,
    arity: usize,
    shape_of: Type,
    body: TokenStream2,
}

/// Parsed `method(...)` attribute
#[derive(Default)]
struct MethodAttr {
    name: Option<String>,
    call: Option<Ident>,
    args: Vec<Type>,
    returns: Option<Type>,
    fallible: bool,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Accessible cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "Accessible can only be derived for structs",
            ))
        }
    };

    let mut entries = field_entries(fields)?;
    for method in parse_methods(&input.attrs)? {
        entries.push(method_entry(method)?);
    }

    let type_name = name.to_string();
    let signatures = entries.iter().map(|e| {
        let accessor = &e.name;
        let arity = e.arity;
        let ty = &e.shape_of;
        quote! {
            ::gedmark::AccessorSignature::new(#accessor, #arity, <#ty as ::gedmark::Shaped>::SHAPE)
        }
    });
    let arms = entries.iter().enumerate().map(|(index, e)| {
        let body = &e.body;
        quote! { #index => { #body } }
    });
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

    Ok(quote! {
        impl ::gedmark::Accessible for #name {
            fn type_name(&self) -> &'static str {
                #type_name
            }

            fn accessors(&self) -> ::std::vec::Vec<::gedmark::AccessorSignature> {
                ::std::vec![#(#signatures),*]
            }

            #[allow(unused_variables)]
            fn access(
                &self,
                index: usize,
                args: &[::gedmark::Value],
            ) -> ::std::result::Result<::gedmark::Value, ::gedmark::AccessError> {
                match index {
                    #(#arms)*
                    _ => ::std::result::Result::Err(::gedmark::AccessError::UnknownAccessor {
                        type_name: #type_name,
                        index,
                    }),
                }
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn clone_boxed(&self) -> ::std::boxed::Box<dyn ::gedmark::Accessible> {
                ::std::boxed::Box::new(::std::clone::Clone::clone(self))
            }
        }

        impl ::gedmark::Shaped for #name {
            const SHAPE: ::std::option::Option<::gedmark::ResultShape> =
                ::std::option::Option::Some(::gedmark::ResultShape::DomainObject);

            fn to_value(&self) -> ::gedmark::Value {
                ::gedmark::Value::Node(::std::boxed::Box::new(::std::clone::Clone::clone(self)))
            }
        }

        impl #name {
            /// Accessor names in table order (generated by Accessible)
            #[inline]
            #[allow(dead_code)]
            pub const fn gedmark_accessors() -> &'static [&'static str] {
                &[#(#names),*]
            }
        }
    })
}

fn field_entries(fields: &Fields) -> syn::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for (position, field) in fields.iter().enumerate() {
        let attrs = FieldAttrs::parse(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let (default_name, member) = match &field.ident {
            Some(ident) => (accessor_name(ident), Member::Named(ident.clone())),
            None => (
                format!("field_{position}"),
                Member::Unnamed(Index::from(position)),
            ),
        };
        let name = attrs.rename.unwrap_or(default_name);
        let body = quote! {
            ::gedmark::AccessError::check_arity(#name, 0, args)?;
            ::std::result::Result::Ok(::gedmark::Shaped::to_value(&self.#member))
        };
        entries.push(Entry {
            name,
            arity: 0,
            shape_of: field.ty.clone(),
            body,
        });
    }
    Ok(entries)
}

fn method_entry(method: MethodAttr) -> syn::Result<Entry> {
    let Some(returns) = method.returns else {
        return Err(syn::Error::new(
            Span::call_site(),
            "method(...) requires returns(Type)",
        ));
    };
    let call = match (&method.call, &method.name) {
        (Some(call), _) => call.clone(),
        (None, Some(name)) => syn::parse_str::<Ident>(name)?,
        (None, None) => {
            return Err(syn::Error::new(
                Span::call_site(),
                "method(...) requires name = \"..\" or call = fn_name",
            ))
        }
    };
    let name = method.name.unwrap_or_else(|| accessor_name(&call));
    let arity = method.args.len();

    let arg_idents: Vec<Ident> = (0..arity).map(|i| format_ident!("arg{}", i)).collect();
    let conversions = method.args.iter().zip(&arg_idents).enumerate().map(|(i, (ty, ident))| {
        quote! {
            let #ident = <#ty as ::gedmark::FromValue>::from_value(&args[#i])
                .map_err(|e| e.at_position(#i))?;
        }
    });
    let invocation = if method.fallible {
        quote! {
            let result: #returns = self.#call(#(#arg_idents),*)
                .map_err(|e| ::gedmark::AccessError::failed(e))?;
        }
    } else {
        quote! {
            let result: #returns = self.#call(#(#arg_idents),*);
        }
    };

    let body = quote! {
        ::gedmark::AccessError::check_arity(#name, #arity, args)?;
        #(#conversions)*
        #invocation
        ::std::result::Result::Ok(::gedmark::Shaped::to_value(&result))
    };

    Ok(Entry {
        name,
        arity,
        shape_of: returns,
        body,
    })
}

/// Field-level `#[gedmark(..)]` options
#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    rename: Option<String>,
}

impl FieldAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("gedmark")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    parsed.skip = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    parsed.rename = Some(lit.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `skip` or `rename = \"..\"`"))
                }
            })?;
        }
        Ok(parsed)
    }
}

/// Parse struct-level `#[gedmark(method(..))]` entries in declaration order
fn parse_methods(attrs: &[Attribute]) -> syn::Result<Vec<MethodAttr>> {
    let mut methods = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("gedmark")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("method") {
                return Err(meta.error("expected `method(..)`"));
            }
            let mut method = MethodAttr::default();
            meta.parse_nested_meta(|inner| {
                if inner.path.is_ident("name") {
                    let lit: LitStr = inner.value()?.parse()?;
                    method.name = Some(lit.value());
                } else if inner.path.is_ident("call") {
                    method.call = Some(inner.value()?.parse()?);
                } else if inner.path.is_ident("args") {
                    let content;
                    syn::parenthesized!(content in inner.input);
                    let types = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
                    method.args = types.into_iter().collect();
                } else if inner.path.is_ident("returns") {
                    let content;
                    syn::parenthesized!(content in inner.input);
                    method.returns = Some(content.parse()?);
                } else if inner.path.is_ident("fallible") {
                    method.fallible = true;
                } else {
                    return Err(inner.error("unsupported method property"));
                }
                Ok(())
            })?;
            methods.push(method);
            Ok(())
        })?;
    }
    Ok(methods)
}

/// Field or method identifier as an accessor name (raw prefix removed)
fn accessor_name(ident: &Ident) -> String {
    let name = ident.to_string();
    name.strip_prefix("r#").map_or_else(|| name.clone(), str::to_string)
}
