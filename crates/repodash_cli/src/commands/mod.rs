pub(crate) mod delete;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod meta;
pub(crate) mod profile;
pub(crate) mod repos;
pub(crate) mod shared;
pub(crate) mod show;
