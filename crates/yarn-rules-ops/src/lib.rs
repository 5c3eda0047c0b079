pub mod ops_generate;
