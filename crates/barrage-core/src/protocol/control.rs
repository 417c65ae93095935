//! Client control bodies.

use super::frame::Frame;
use super::kv::KvBody;

/// Group id the server uses for "all barrage in the room".
pub const GROUP_ALL: i32 = -9999;

/// `type@=loginreq/roomid@={room}/`
pub fn login_req(room_id: &str) -> Frame {
    Frame::control(
        KvBody::new()
            .pair("type", "loginreq")
            .pair("roomid", room_id)
            .finish(),
    )
}

/// `type@=joingroup/gid@=-9999/rid@={room}/`
pub fn join_group(room_id: &str) -> Frame {
    Frame::control(
        KvBody::new()
            .pair("type", "joingroup")
            .pair("gid", GROUP_ALL)
            .pair("rid", room_id)
            .finish(),
    )
}

/// `type@=mrkl/`
pub fn heartbeat() -> Frame {
    Frame::control(KvBody::new().pair("type", "mrkl").finish())
}

/// `type@=logout/`
pub fn logout() -> Frame {
    Frame::control(KvBody::new().pair("type", "logout").finish())
}
