pub mod boot;
pub mod chroot;
pub mod desktop;
pub mod fstab;
pub mod gaming;
pub mod install;
pub mod multilib;
pub mod network;
pub mod swap;
pub mod system;
pub mod users;
