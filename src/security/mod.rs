mod path;


pub use path::ResourcePath;
