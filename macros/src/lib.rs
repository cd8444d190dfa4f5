//! Procedural macros for drone-regops.
//!
//! See `drone-regops` documentation for details.

#![deny(elided_lifetimes_in_paths)]
#![warn(clippy::pedantic)]

extern crate proc_macro;

mod mod_name;
mod new_mod;
mod reg_map;

use proc_macro::TokenStream;

#[proc_macro]
pub fn reg_map(input: TokenStream) -> TokenStream {
    reg_map::proc_macro(input)
}
