//! 通用工具函数

use rand::Rng;

/// 记录ID字符集：小写字母与数字
const ID_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// 生成随机记录ID
///
/// 抗碰撞但非加密用途，长度由配置指定。
pub fn generate_record_id(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| ID_CHARSET[rng.gen_range(0..ID_CHARSET.len())] as char)
        .collect()
}

/// 将名称净化为可安全使用的文件名
///
/// 路径分隔符、保留符号与控制字符替换为下划线。
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
