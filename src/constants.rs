// src/constants.rs

pub const UI_WIDTH: usize = 72;
pub const URL_PREVIEW_LENGTH: usize = 70;
pub const MAX_FILENAME_BYTES: usize = 200;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_SAVE_DIR: &str = "images";
pub const DEFAULT_EXTENSION: &str = ".png";
pub const COOKIE_ENV_VAR: &str = "CX_COOKIE";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub const HELP_COOKIE_GUIDE: &str = r#"
1. 登录平台: 使用 Chrome / Edge / Firefox 浏览器登录学习通。
   (登录地址: https://passport2.chaoxing.com/login)
2. 打开任意课程页面，然后打开开发者工具:
   - 在 Windows / Linux 上: 按 F12 或 Ctrl+Shift+I
   - 在 macOS 上: 按 Cmd+Opt+I (⌘⌥I)
3. 切换到“网络” (Network) 标签页，刷新页面。
4. 点击任意一个发往 chaoxing.com 的请求，在“请求标头”中找到 Cookie。
   (也可以在“控制台”中输入 document.cookie，但部分 HttpOnly 字段会缺失)
5. 复制整段 Cookie (形如 'UID=...; _uid=...; fid=...')，通过 --cookie 传入，
   或设置环境变量 CX_COOKIE。"#;

/// 图片候选地址必须包含以下任一片段，才会被视为文档/作业图片
pub mod image_gate {
    pub const DOC_STORAGE_SEGMENT: &str = "/sv-w8/doc/";
    pub const CDN_HOST_FRAGMENT: &str = "ananas.chaoxing.com";
}

pub mod labels {
    pub const COURSE_FALLBACK: &str = "课程";
    pub const CHAPTER_FALLBACK: &str = "章节";
    pub const HOMEWORK_FALLBACK: &str = "作业";
}

pub mod hints {
    pub const COURSE_USAGE: &[&str] = &[
        "请确认您选择了正确的爬取模式",
        "course 模式需要课程章节链接 (包含 chapterId 参数)",
        "homework 模式需要作业页面链接",
    ];
    pub const COURSE_NO_IMAGES: &[&str] = &[
        "请确认该章节包含文档 (PDF/PPT) 类型的任务点",
        "请确认 Cookie 对应的账号已加入该课程",
    ];
    pub const HOMEWORK_NO_IMAGES: &[&str] = &[
        "请确认该页面是作业答案页面",
        "请确认作业答案区域包含图片",
        "如果是课程章节，请使用 --mode course 模式",
    ];
}
