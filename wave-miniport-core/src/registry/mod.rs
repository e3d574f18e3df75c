pub mod slot_table;
