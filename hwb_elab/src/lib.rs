pub mod elab;
pub mod util;

#[cfg(test)]
mod tests;
