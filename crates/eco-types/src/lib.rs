//! Shared types for the EcoDelicias client.
//!
//! Every struct here mirrors a JSON shape exchanged with the remote REST API
//! (camelCase field names on the wire).

mod blog;
mod lookup;
mod recipe;
mod resource;
mod session;
mod user;
mod validation;

pub use blog::{BlogForm, EcologicalBlog, NewEcologicalBlog};
pub use lookup::{Category, Country, Difficulty, Gender, Lookup, UserType};
pub use recipe::{NewRecipe, Recipe, RecipeForm};
pub use resource::{iso_timestamp, Resource, ResourceId};
pub use session::{Session, UserRole};
pub use user::{LoginRequest, LoginResponse, NewUser, User};
pub use validation::{LoginForm, RegistrationForm, ValidationIssue, ValidationResult};
