mod location;

pub use location::{District, LocationDataset, Municipality, Province};
