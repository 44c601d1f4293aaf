pub mod errors;
pub mod db;
pub mod user;
pub mod invitation;
pub mod sector;
pub mod subsector;
pub mod indiciado;
pub mod vehiculo;
pub mod documento;
