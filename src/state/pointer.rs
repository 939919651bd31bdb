// Transient hover state kept outside the reducer so cursor styling does not
// churn on every mousemove.
#[derive(Default, Debug, Clone)]
pub struct PointerState {
    pub over_draggable: bool,
    pub grabbing: bool,
}
