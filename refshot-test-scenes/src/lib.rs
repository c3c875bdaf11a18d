pub mod scene;

pub use scene::{
    checkerboard, gradient, perturb_pixels, solid, CheckerboardLayer, GradientView,
    CANVAS_HEIGHT, CANVAS_WIDTH,
};
