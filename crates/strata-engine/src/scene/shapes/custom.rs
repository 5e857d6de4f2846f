use std::fmt;
use std::rc::Rc;

use crate::path::PathBuilder;

use super::ShapeGeometry;

type BuildFn = Rc<dyn Fn(&mut dyn PathBuilder)>;

/// Caller-supplied outline.
#[derive(Clone)]
pub struct CustomPath {
    build: BuildFn,
}

impl CustomPath {
    pub fn new(build: impl Fn(&mut dyn PathBuilder) + 'static) -> Self {
        Self { build: Rc::new(build) }
    }
}

impl fmt::Debug for CustomPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomPath")
    }
}

impl ShapeGeometry for CustomPath {
    fn build_path(&self, path: &mut dyn PathBuilder) {
        (self.build)(path);
    }
}
