pub mod event;
pub mod ticket;
pub mod user;

pub use event::{Event, EventChanges, EventUpdate, EventView, NewEvent};
pub use ticket::{Ticket, TicketSummary};
pub use user::{LoginIdentity, NewUser, Profile, ProfileChanges, User, UserUpdate};
