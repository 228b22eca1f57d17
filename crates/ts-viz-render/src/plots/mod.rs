pub mod trends;

mod axes_draw;
