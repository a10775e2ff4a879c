pub mod card;
pub mod clock;
pub mod guid;
pub mod import;
pub mod note;
pub mod types;

pub use card::{
    make_card,
    Card,
};
pub use clock::{
    Clock,
    IdAllocator,
    Stamp,
    SystemClock,
};
pub use guid::GuidGenerator;
pub use import::{
    BatchImporter,
    ImportBatch,
};
pub use note::{
    field_checksum,
    make_note,
    Note,
};
pub use types::{
    select,
    Choice,
    Deck,
    Model,
    Template,
};
