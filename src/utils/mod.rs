mod sampling;

pub(crate) use sampling::choose_key;
