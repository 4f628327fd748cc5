fn main() {
    danmaku_game::game::run();
}
