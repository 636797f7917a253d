use proc_macro::TokenStream;
use quote::quote;

#[derive(deluxe::ParseMetaItem)]
#[deluxe(attributes(scoring_modifier))]
struct ModifierAttributes(syn::Ident, #[deluxe(flatten)] ModifierNamedAttributes);

#[derive(deluxe::ParseMetaItem)]
struct ModifierNamedAttributes {
  name: String,
}

/// Declares a unit struct implementing `Modifier` from a bare `compute` function.
///
/// ```ignore
/// #[scoring_modifier(FiberWords, name = "fiber_words")]
/// fn compute(&self, ctx: &ModifierContext) -> f64 { ... }
/// ```
#[proc_macro_attribute]
pub fn scoring_modifier(attrs: TokenStream, input: TokenStream) -> TokenStream {
  let ModifierAttributes(ident, ModifierNamedAttributes { name }) = match deluxe::parse2::<ModifierAttributes>(attrs.into()) {
    Ok(attributes) => attributes,
    Err(err) => return err.into_compile_error().into(),
  };

  let input = proc_macro2::TokenStream::from(input);

  quote! {
      pub(crate) struct #ident;

      impl Modifier for #ident {
        fn name(&self) -> &'static str {
            #name
        }

        #[tracing::instrument(level = "trace", name = #name, skip_all, fields(strategy = ctx.candidate.strategy.as_str()))]
        #input
      }
  }
  .into()
}
