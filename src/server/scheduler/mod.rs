pub mod display_sweep;
