mod handler;
mod model;

pub use handler::{
    create_user, delete_user, import_template, import_users, me, reset_password, unlock_user,
    update_status,
};
pub use model::{
    CourseSummary, MeResponse, ResetPasswordRequest, UpdateStatusRequest, UserProfile,
};
