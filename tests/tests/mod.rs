mod apply;
mod inspect;
mod snapshot;
