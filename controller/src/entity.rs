pub mod game_template;

pub use game_template::Entity as GameTemplate;
