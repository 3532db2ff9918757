pub mod cpd;
