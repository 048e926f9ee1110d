// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod export;
pub mod modal;
pub mod record;
pub mod records;
pub mod view;

pub use export::*;
pub use modal::*;
pub use record::*;
pub use records::*;
pub use view::*;
