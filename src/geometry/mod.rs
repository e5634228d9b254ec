mod point;
mod rectangle;

pub use point::Point2D;
pub use rectangle::Rectangle;
