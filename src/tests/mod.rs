mod properties;
mod take;
