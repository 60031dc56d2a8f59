pub mod shortened_url;

pub use shortened_url::Entity as ShortenedUrlEntity;
