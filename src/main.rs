mod boot;
mod dom;
mod effects;
mod page;
mod reveal;
mod timers;
mod upload;
mod viewer;

fn main() {
    console_error_panic_hook::set_once();
    page::mount_when_ready();
}
