/// Bound on the value type carried by a fragment's parameters.
pub trait SQLParam: Clone + std::fmt::Debug {}
