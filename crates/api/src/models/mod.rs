//! Domain and transfer types for the API.

pub mod dto;
pub mod user;

pub use dto::{BasketDto, BasketItemDto, LoginRequest, RegisterRequest, UserDto};
pub use user::User;
