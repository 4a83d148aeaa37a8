pub mod band_io;
