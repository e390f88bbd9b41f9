fn main() {
    swarm_arena::game::run();
}
