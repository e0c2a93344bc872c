pub mod annotation;
pub mod bucket;
pub mod scatter;
pub mod slug;
pub mod vignette;

pub use annotation::{Annotation, AnnotationKey, AnnotationType, NewAnnotation};
pub use bucket::{Bucket, NewBucket};
pub use scatter::{Coordinate, NewScatterPlot, ScatterPlot, ScatterPlotType};
pub use slug::normalize;
pub use vignette::{NewVignette, Vignette};
