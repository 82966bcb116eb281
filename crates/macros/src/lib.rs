use proc_macro::TokenStream;
use quote::quote;

#[derive(deluxe::ParseMetaItem)]
#[deluxe(attributes(score_component))]
struct ComponentAttributes(syn::Ident, #[deluxe(flatten)] ComponentNamedAttributes);

#[derive(deluxe::ParseMetaItem)]
struct ComponentNamedAttributes {
  name: String,
}

/// Turns a `measure` function into a unit struct implementing `Component`.
///
/// The annotated function must have the signature of `Component::measure`,
/// and the `Component` trait must be in scope where the macro is used.
#[proc_macro_attribute]
pub fn score_component(attrs: TokenStream, input: TokenStream) -> TokenStream {
  let ComponentAttributes(ident, ComponentNamedAttributes { name }) = match deluxe::parse2::<ComponentAttributes>(attrs.into()) {
    Ok(attrs) => attrs,
    Err(err) => return err.to_compile_error().into(),
  };

  let input = proc_macro2::TokenStream::from(input);

  quote! {
      pub(crate) struct #ident;

      impl Component for #ident {
        fn name(&self) -> &'static str {
            #name
        }

        #[tracing::instrument(level = "trace", name = #name, skip_all, fields(lhs = %lhs.id, rhs = %rhs.id))]
        #input
      }
  }
  .into()
}
