pub mod activity;
pub mod group;
pub mod season;
pub mod user;

pub use activity::{Activity, NewActivity};
pub use group::{Group, GroupMember, MemberRole, NewGroup};
pub use season::{NewSeason, Season, SeasonOverview};
pub use user::{NewUser, User};
