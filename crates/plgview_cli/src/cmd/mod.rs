/// Live-process memory capture command.
pub mod capture;
/// `plg::any` catalog listing and validation command.
pub mod catalog;
/// Formatter registration listing command.
pub mod formatters;
/// Value-tree inspection command.
pub mod inspect;
/// Resolved type layout command.
pub mod layout;

#[cfg(test)]
pub(crate) mod test_support;
pub(crate) mod util;
