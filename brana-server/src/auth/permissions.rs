//! Permission Definitions
//!
//! 简化的 RBAC 权限体系。
//!
//! ## 设计原则
//! - 店面浏览 (商品/分类/横幅/下单) 无需登录
//! - 后台按模块授权
//! - 用户管理与数据重置仅管理员可用

use shared::models::UserRole;

pub const PRODUCTS_MANAGE: &str = "products:manage";
pub const CATEGORIES_MANAGE: &str = "categories:manage";
pub const BANNERS_MANAGE: &str = "banners:manage";
pub const ORDERS_VIEW: &str = "orders:view";
pub const ORDERS_MANAGE: &str = "orders:manage";
pub const CUSTOMERS_VIEW: &str = "customers:view";
pub const INVENTORY_VIEW: &str = "inventory:view";
pub const UPLOAD_IMAGES: &str = "upload:images";
pub const USERS_MANAGE: &str = "users:manage";

/// 系统级权限，admin 角色默认持有；数据重置只认它
pub const ALL: &str = "all";

/// 可配置权限列表
/// 不包含 "all"，这是系统级权限
pub const ALL_PERMISSIONS: &[&str] = &[
    PRODUCTS_MANAGE,   // 商品管理 (含促销、变体生成)
    CATEGORIES_MANAGE, // 分类管理
    BANNERS_MANAGE,    // 横幅管理
    ORDERS_VIEW,       // 订单查看 (含看板)
    ORDERS_MANAGE,     // 订单修改/删除
    CUSTOMERS_VIEW,    // 客户分析
    INVENTORY_VIEW,    // 库存预警
    UPLOAD_IMAGES,     // 图片上传
    USERS_MANAGE,      // 用户管理
];

/// Admin / super admin 默认权限
pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &[ALL];

/// 经理角色默认权限
pub const DEFAULT_MANAGER_PERMISSIONS: &[&str] = &[
    PRODUCTS_MANAGE,
    CATEGORIES_MANAGE,
    BANNERS_MANAGE,
    ORDERS_VIEW,
    ORDERS_MANAGE,
    CUSTOMERS_VIEW,
    INVENTORY_VIEW,
    UPLOAD_IMAGES,
];

/// 普通用户默认权限 (只读)
pub const DEFAULT_USER_PERMISSIONS: &[&str] = &[ORDERS_VIEW, CUSTOMERS_VIEW, INVENTORY_VIEW];

/// Get default permissions for a role
pub fn get_default_permissions(role: UserRole) -> Vec<String> {
    let perms = match role {
        UserRole::SuperAdmin | UserRole::Admin => DEFAULT_ADMIN_PERMISSIONS,
        UserRole::Manager => DEFAULT_MANAGER_PERMISSIONS,
        UserRole::User => DEFAULT_USER_PERMISSIONS,
    };
    perms.iter().map(|s| s.to_string()).collect()
}

/// Check that every entry is a known permission (or "all")
pub fn validate_permissions(permissions: &[String]) -> Result<(), String> {
    for p in permissions {
        if p != ALL && !ALL_PERMISSIONS.contains(&p.as_str()) {
            return Err(format!("Unknown permission: {}", p));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_permissions() {
        assert_eq!(get_default_permissions(UserRole::SuperAdmin), vec!["all"]);
        assert!(get_default_permissions(UserRole::Manager).contains(&PRODUCTS_MANAGE.to_string()));
        assert!(!get_default_permissions(UserRole::Manager).contains(&USERS_MANAGE.to_string()));
        assert!(!get_default_permissions(UserRole::User).contains(&ORDERS_MANAGE.to_string()));
    }

    #[test]
    fn test_validate_permissions() {
        assert!(validate_permissions(&["all".to_string(), "orders:view".to_string()]).is_ok());
        assert!(validate_permissions(&["orders:fly".to_string()]).is_err());
        // 数据重置不再是可配置权限
        assert!(validate_permissions(&["seed:run".to_string()]).is_err());
    }
}
