pub mod acp;
pub mod base;
pub mod output;

#[cfg(test)]
pub mod mock;
