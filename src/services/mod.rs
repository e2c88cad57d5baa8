pub mod auto_update;
