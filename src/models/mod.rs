//! 业务数据模型
//!
//! 与 `entity` 模块中的 SeaORM 表模型分离，服务层只使用这里的类型。

pub mod attachments {
    pub mod entities;
}

pub mod assignments {
    pub mod entities;
    pub mod requests;
}

pub mod grades {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod submissions {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod users {
    pub mod entities;
}
